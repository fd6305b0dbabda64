pub mod service_dto;
