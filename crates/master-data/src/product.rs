// Product module - placeholder for future implementation
// Will include comprehensive product information management functionality

pub mod model {
    // Product data models will be implemented here
}

pub mod repository {
    // Product database operations will be implemented here
}

pub mod service {
    // Product business logic will be implemented here
}

#[cfg(feature = "axum")]
pub mod handlers {
    // Product HTTP handlers will be implemented here
}