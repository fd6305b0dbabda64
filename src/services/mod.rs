pub mod api_client;
pub mod catalog_service;
pub mod currency_service;
pub mod favorites_service;
pub mod media_service;
pub mod submission_service;
