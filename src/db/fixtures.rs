// db/fixtures.rs
use chrono::{DateTime, Duration, Utc};

use crate::models::{
    knowledgemodel::KnowledgeItem,
    ticketmodel::{Comment, Ticket, TicketCategory, TicketPriority, TicketStatus},
    usermodel::{User, UserRef, UserRole},
};

fn avatar(key: &str) -> Option<String> {
    Some(format!("https://i.pravatar.cc/150?u={}", key))
}

fn user(id: &str, name: &str, email: &str, role: UserRole, avatar_key: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        avatar: avatar(avatar_key),
    }
}

fn user_ref(id: &str, name: &str) -> UserRef {
    UserRef {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn users() -> Vec<User> {
    vec![
        user("1", "Admin User", "admin@example.com", UserRole::Admin, "admin"),
        user("2", "Support Agent", "agent@example.com", UserRole::Agent, "agent"),
        user("3", "Customer", "customer@example.com", UserRole::Customer, "customer"),
        user("4", "John Doe", "john@example.com", UserRole::Customer, "john"),
        user("5", "Sarah Johnson", "sarah@example.com", UserRole::Agent, "sarah"),
        user("6", "Robert Smith", "robert@example.com", UserRole::Customer, "robert"),
        user("7", "Emily Davis", "emily@example.com", UserRole::Customer, "emily"),
    ]
}

fn comment(
    id: &str,
    author: &UserRef,
    avatar_key: &str,
    content: &str,
    created_at: DateTime<Utc>,
) -> Comment {
    Comment {
        id: id.to_string(),
        user_id: author.id.clone(),
        user_name: author.name.clone(),
        user_avatar: avatar(avatar_key),
        content: content.to_string(),
        created_at,
    }
}

pub fn tickets(now: DateTime<Utc>) -> Vec<Ticket> {
    let days_ago = |days: i64| now - Duration::days(days);
    let customer = user_ref("3", "Customer");
    let agent = user_ref("2", "Support Agent");

    vec![
        Ticket {
            id: "1".to_string(),
            title: "Cannot access my account".to_string(),
            description: "I am unable to log into my account after the recent update. I keep getting an error message saying \"Invalid credentials\".".to_string(),
            category: TicketCategory::Technical,
            priority: TicketPriority::High,
            status: TicketStatus::Open,
            created_at: days_ago(2),
            updated_at: days_ago(2),
            created_by: customer.clone(),
            assigned_to: None,
            comments: vec![comment(
                "1",
                &customer,
                "customer",
                "I tried clearing my cache but still having the same issue.",
                days_ago(1),
            )],
            resolution: None,
            attachments: Vec::new(),
        },
        Ticket {
            id: "2".to_string(),
            title: "Billing discrepancy on my last invoice".to_string(),
            description: "I was charged $59.99 but my plan should be $49.99 per month. Please check and adjust my bill.".to_string(),
            category: TicketCategory::Billing,
            priority: TicketPriority::Medium,
            status: TicketStatus::InProgress,
            created_at: days_ago(5),
            updated_at: days_ago(1),
            created_by: customer.clone(),
            assigned_to: Some(agent.clone()),
            comments: vec![comment(
                "2",
                &agent,
                "agent",
                "I'm looking into this issue for you. I'll check your billing records and get back to you shortly.",
                days_ago(1),
            )],
            resolution: None,
            attachments: Vec::new(),
        },
        Ticket {
            id: "3".to_string(),
            title: "Feature request: Dark mode".to_string(),
            description: "It would be great if you could add a dark mode option to reduce eye strain when using the app at night.".to_string(),
            category: TicketCategory::FeatureRequest,
            priority: TicketPriority::Low,
            status: TicketStatus::Open,
            created_at: days_ago(10),
            updated_at: days_ago(10),
            created_by: customer.clone(),
            assigned_to: None,
            comments: Vec::new(),
            resolution: None,
            attachments: Vec::new(),
        },
        Ticket {
            id: "4".to_string(),
            title: "Need help with integration".to_string(),
            description: "I'm trying to integrate your API with my application but getting CORS errors. Please advise.".to_string(),
            category: TicketCategory::Technical,
            priority: TicketPriority::Medium,
            status: TicketStatus::Resolved,
            created_at: days_ago(15),
            updated_at: days_ago(12),
            created_by: customer.clone(),
            assigned_to: Some(agent.clone()),
            comments: vec![
                comment(
                    "3",
                    &agent,
                    "agent",
                    "You need to add your domain to the whitelist in your API settings. Let me know if you need further assistance.",
                    days_ago(13),
                ),
                comment(
                    "4",
                    &customer,
                    "customer",
                    "That worked! Thank you so much for your help.",
                    days_ago(12),
                ),
            ],
            resolution: None,
            attachments: Vec::new(),
        },
    ]
}

pub fn knowledge_base(now: DateTime<Utc>) -> Vec<KnowledgeItem> {
    let days_ago = |days: i64| now - Duration::days(days);
    let tags = |tags: &[&str]| tags.iter().map(|t| t.to_string()).collect::<Vec<_>>();

    vec![
        KnowledgeItem {
            id: "1".to_string(),
            title: "How to reset your password".to_string(),
            content: "To reset your password, visit the login page and click on \"Forgot Password\". Follow the instructions sent to your email address.".to_string(),
            category: TicketCategory::Technical,
            created_at: days_ago(30),
            created_by: user_ref("2", "Support Agent"),
            tags: tags(&["password", "login", "account"]),
        },
        KnowledgeItem {
            id: "2".to_string(),
            title: "Understanding your monthly invoice".to_string(),
            content: "Your monthly invoice includes your base subscription fee and any additional services you may have used during the billing period. Taxes are calculated based on your location.".to_string(),
            category: TicketCategory::Billing,
            created_at: days_ago(20),
            created_by: user_ref("2", "Support Agent"),
            tags: tags(&["billing", "invoice", "subscription"]),
        },
        KnowledgeItem {
            id: "3".to_string(),
            title: "Troubleshooting API integration issues".to_string(),
            content: "Common API integration issues include incorrect authentication, CORS errors, and rate limiting. Make sure your API key is valid, your domain is whitelisted, and you are not exceeding the rate limits.".to_string(),
            category: TicketCategory::Technical,
            created_at: days_ago(15),
            created_by: user_ref("5", "Sarah Johnson"),
            tags: tags(&["api", "integration", "cors", "troubleshooting"]),
        },
    ]
}
