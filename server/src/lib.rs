pub mod broadcast;
pub mod chat;
pub mod gateway;
pub mod ledger;
pub mod table_actor;
