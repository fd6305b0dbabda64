pub mod draft;
pub mod localized;
pub mod media;
pub mod service;
