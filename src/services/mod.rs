// Explosion engine and structural validation. Both services are stateless
// and reentrant; all traversal state is per call.
pub mod explosion;
pub mod validation;

pub use explosion::ExplosionService;
pub use validation::BomValidationService;
