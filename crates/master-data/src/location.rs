// Location module - placeholder for future implementation
// Will include comprehensive location and geography management functionality

pub mod model {
    // Location data models will be implemented here
}

pub mod repository {
    // Location database operations will be implemented here
}

pub mod service {
    // Location business logic will be implemented here
}

#[cfg(feature = "axum")]
pub mod handlers {
    // Location HTTP handlers will be implemented here
}