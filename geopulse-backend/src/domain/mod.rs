// src/domain/mod.rs
pub mod favorite_location_model;
pub mod favorite_type;
pub mod friend_invitation_model;
pub mod gps_point_model;
pub mod gps_source_config_model;
pub mod gps_source_type;
pub mod invitation_status;
pub mod reverse_geocoding_location_model;
pub mod shared_link_model;
pub mod user_friend_model;
pub mod user_model;
