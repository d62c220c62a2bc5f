pub mod db;
pub mod fixtures;
pub mod knowledgedb;
pub mod session;
pub mod ticketdb;
pub mod userdb;
