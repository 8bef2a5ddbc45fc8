// Organization module - placeholder for future implementation
// Will include comprehensive organizational structure management functionality

pub mod model {
    // Organization data models will be implemented here
}

pub mod repository {
    // Organization database operations will be implemented here
}

pub mod service {
    // Organization business logic will be implemented here
}

#[cfg(feature = "axum")]
pub mod handlers {
    // Organization HTTP handlers will be implemented here
}