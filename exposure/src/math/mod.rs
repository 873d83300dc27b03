mod destination;

pub use destination::{project, project_planar};
