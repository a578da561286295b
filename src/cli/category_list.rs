//! Prints the fixed category catalog.

use crate::core::catalog;

pub fn print_categories() {
    println!("Available categories:");
    println!();
    for category in catalog::catalog() {
        println!("  {:<22} {}", category.id, category.description);
    }
    println!();
    println!("Start a session in a category with: sahayak chat -c \"<category>\"");
}
