/// A solid material a component is built from.
///
/// Immutable after construction, per the data model: there is no setter,
/// only replacement via `Component::set_material`, which clears caches.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// kg/m^3
    pub density: f64,
}

impl Material {
    pub fn new(name: impl Into<String>, density: f64) -> Self {
        Material {
            name: name.into(),
            density: density.max(0.0),
        }
    }

    pub fn cardboard() -> Self {
        Material::new("cardboard", 680.0)
    }

    pub fn pla() -> Self {
        Material::new("PLA", 1250.0)
    }

    pub fn plywood() -> Self {
        Material::new("plywood", 630.0)
    }
}

/// Surface finish, used by the friction-drag correlation via its roughness.
#[derive(Debug, Clone, PartialEq)]
pub struct Finish {
    pub name: String,
    /// meters
    pub roughness: f64,
}

impl Finish {
    pub fn new(name: impl Into<String>, roughness: f64) -> Self {
        Finish {
            name: name.into(),
            roughness: roughness.max(0.0),
        }
    }

    pub fn smooth() -> Self {
        Finish::new("smooth", 2e-6)
    }
}
