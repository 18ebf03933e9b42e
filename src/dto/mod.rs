//! DTOs para las integraciones externas

pub mod geocoding_dto;
