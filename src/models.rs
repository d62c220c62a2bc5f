pub mod knowledgemodel;
pub mod ticketmodel;
pub mod usermodel;
