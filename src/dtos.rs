pub mod knowledgedtos;
pub mod ticketdtos;
pub mod userdtos;
