//! The fixed catalog of help categories.
//!
//! Each category partitions conversation history and tags outgoing questions.
//! The catalog is hardcoded; `general` is the distinguished default whose
//! questions are sent to the backend unmodified.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Seeded as the section's first bot message when the category is opened.
    pub welcome: &'static str,
}

pub const GENERAL_CATEGORY_ID: &str = "general";

static CATALOG: [Category; 8] = [
    Category {
        id: "personal safety",
        title: "Personal Safety",
        description: "Tips and guidance for personal security",
        welcome: "How can I assist you with personal safety?",
    },
    Category {
        id: "vehicle crime",
        title: "Vehicle Crime",
        description: "Report vehicle theft or related crimes",
        welcome: "How can I assist you with vehicle-related crimes?",
    },
    Category {
        id: "home security",
        title: "Home Security",
        description: "Tips for securing your home",
        welcome: "How can I assist you with home security tips?",
    },
    Category {
        id: "computer and internet",
        title: "Computer and Internet",
        description: "Guidance on online safety",
        welcome: "How can I assist you with computer and internet safety?",
    },
    Category {
        id: "consumer fraud",
        title: "Consumer Fraud",
        description: "Report and prevent consumer fraud",
        welcome: "How can I assist you with consumer fraud prevention?",
    },
    Category {
        id: "new crime trends",
        title: "New Crime Trends",
        description: "Stay updated on emerging crime patterns",
        welcome: "How can I assist you with new crime trends?",
    },
    Category {
        id: "youth and drugs",
        title: "Youth Drugs",
        description: "Resources for drug prevention and youth safety",
        welcome: "How can I assist you with youth drug prevention?",
    },
    Category {
        id: GENERAL_CATEGORY_ID,
        title: "General Chat",
        description: "General queries and information",
        welcome: "How can I help you today?",
    },
];

pub fn catalog() -> &'static [Category] {
    &CATALOG
}

pub fn find_category(id: &str) -> Option<&'static Category> {
    CATALOG.iter().find(|category| category.id == id)
}
