// Supplier module - placeholder for future implementation
// Will include comprehensive supplier management functionality

pub mod model {
    // Supplier data models will be implemented here
}

pub mod repository {
    // Supplier database operations will be implemented here
}

pub mod service {
    // Supplier business logic will be implemented here
}

#[cfg(feature = "axum")]
pub mod handlers {
    // Supplier HTTP handlers will be implemented here
}