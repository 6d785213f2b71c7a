pub mod growth;
pub mod replay;
