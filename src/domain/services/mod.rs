pub mod classification;
pub mod id_service;
