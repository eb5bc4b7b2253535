//! Static marketing content for the home and contact pages.
//!
//! The catalog comes from the backend. Everything here is fixed copy that
//! ships with the binary.

/// A reason to choose the bakery, shown on the home page.
#[derive(Debug, Clone, Copy)]
pub struct Feature {
    /// Icon name in the sprite sheet.
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// A house specialty shown on the home page.
#[derive(Debug, Clone, Copy)]
pub struct Specialty {
    pub name: &'static str,
    pub description: &'static str,
    pub price: &'static str,
    pub image: &'static str,
}

/// A headline figure in the hero section.
#[derive(Debug, Clone, Copy)]
pub struct Stat {
    pub value: &'static str,
    pub label: &'static str,
}

/// How to reach the bakery.
#[derive(Debug, Clone, Copy)]
pub struct ContactInfo {
    pub phone: &'static str,
    pub phone_hours: &'static str,
    pub email: &'static str,
    pub address_line: &'static str,
    pub city: &'static str,
}

pub const FEATURES: &[Feature] = &[
    Feature {
        icon: "heart",
        title: "Hecho con Amor",
        description: "Cada pastel es elaborado con dedicacion y los mejores ingredientes naturales.",
    },
    Feature {
        icon: "cake",
        title: "Personalizacion Total",
        description: "Disenos unicos adaptados a tus gustos y necesidades especiales.",
    },
    Feature {
        icon: "clock",
        title: "Entrega Puntual",
        description: "Garantizamos la frescura con entregas programadas a tiempo.",
    },
    Feature {
        icon: "sparkles",
        title: "Calidad Premium",
        description: "Ingredientes de primera calidad en cada una de nuestras creaciones.",
    },
];

pub const SPECIALTIES: &[Specialty] = &[
    Specialty {
        name: "Pastel de Chocolate",
        description: "Delicioso pastel de chocolate con ganache",
        price: "$450",
        image: "/static/images/pastel.svg",
    },
    Specialty {
        name: "Pastel de Vainilla",
        description: "Suave pastel de vainilla con crema",
        price: "$400",
        image: "/static/images/pastel.svg",
    },
    Specialty {
        name: "Pastel Red Velvet",
        description: "Clasico red velvet con queso crema",
        price: "$480",
        image: "/static/images/pastel.svg",
    },
    Specialty {
        name: "Pastel de Zanahoria",
        description: "Pastel de zanahoria con nueces",
        price: "$420",
        image: "/static/images/pastel.svg",
    },
];

pub const STATS: &[Stat] = &[
    Stat {
        value: "15+",
        label: "Anos de experiencia",
    },
    Stat {
        value: "500+",
        label: "Clientes felices",
    },
    Stat {
        value: "100%",
        label: "Artesanal",
    },
];

pub const CONTACT: ContactInfo = ContactInfo {
    phone: "+52 722 123 4567",
    phone_hours: "Llamanos de Lun-Sab 9am-7pm",
    email: "contacto@dulcesmomentos.com",
    address_line: "Av. Universidad 123",
    city: "Toluca, Estado de Mexico",
};
