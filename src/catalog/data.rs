use super::{Membership, MembershipTier, Product};

pub(super) static PRODUCTS: &[Product] = &[
    Product {
        id: "product-1",
        name: "Proteína Whey Pro",
        category: "Suplementos",
        price: 180_000,
        description: "Proteína de suero de alta calidad con 25g de proteína por porción",
        features: &["25g de proteína por porción", "Bajo en azúcar y grasa", "Fácil digestión", "Sabor chocolate premium"],
        bestseller: true,
    },
    Product {
        id: "product-2",
        name: "Camiseta Imperius",
        category: "Ropa",
        price: 100_000,
        description: "Camiseta deportiva de alto rendimiento con tecnología anti-sudor",
        features: &["Tela transpirable", "Secado rápido", "Logo bordado", "Ajuste atlético"],
        bestseller: true,
    },
    Product {
        id: "product-3",
        name: "Pre-Workout Extreme",
        category: "Suplementos",
        price: 140_000,
        description: "Fórmula avanzada para energía y concentración máxima",
        features: &["Energía explosiva", "Mayor concentración", "Sin crash", "Sabor frutal"],
        bestseller: true,
    },
    Product {
        id: "product-4",
        name: "Shorts Deportivos",
        category: "Ropa",
        price: 120_000,
        description: "Shorts de entrenamiento con máxima movilidad y comodidad",
        features: &["Tela elástica", "Bolsillos con cierre", "Cintura ajustable", "Diseño ergonómico"],
        bestseller: true,
    },
    Product {
        id: "product-5",
        name: "Creatina Monohidrato",
        category: "Suplementos",
        price: 112_000,
        description: "Creatina pura para aumentar fuerza y masa muscular",
        features: &["100% pura", "Aumenta fuerza", "Mejora rendimiento", "Sin sabor"],
        bestseller: true,
    },
    Product {
        id: "product-6",
        name: "Guantes de Entrenamiento",
        category: "Accesorios",
        price: 80_000,
        description: "Guantes profesionales con agarre superior y protección",
        features: &["Agarre antideslizante", "Acolchado premium", "Muñequera ajustable", "Durabilidad garantizada"],
        bestseller: true,
    },
    Product {
        id: "product-7",
        name: "BCAA Energy",
        category: "Suplementos",
        price: 128_000,
        description: "Aminoácidos esenciales para recuperación y energía",
        features: &["Recuperación muscular", "Energía sostenida", "Sabor a frutas"],
        bestseller: false,
    },
    Product {
        id: "product-8",
        name: "Sudadera Imperius",
        category: "Ropa",
        price: 180_000,
        description: "Sudadera premium con capucha y logo bordado",
        features: &["Algodón premium", "Capucha ajustable", "Logo bordado"],
        bestseller: false,
    },
    Product {
        id: "product-9",
        name: "Shaker Premium",
        category: "Accesorios",
        price: 60_000,
        description: "Shaker de alta calidad con compartimentos",
        features: &["Libre de BPA", "Compartimento para suplementos", "Tapa antigoteo"],
        bestseller: false,
    },
    Product {
        id: "product-10",
        name: "Cinturón de Levantamiento",
        category: "Accesorios",
        price: 220_000,
        description: "Cinturón profesional de cuero para levantamiento",
        features: &["Cuero genuino", "Hebilla reforzada", "Soporte lumbar"],
        bestseller: false,
    },
    Product {
        id: "product-11",
        name: "Glutamina Recovery",
        category: "Suplementos",
        price: 120_000,
        description: "Glutamina pura para recuperación muscular",
        features: &["Recuperación acelerada", "Apoyo inmunológico", "Sin sabor"],
        bestseller: false,
    },
    Product {
        id: "product-12",
        name: "Pantalones Jogger",
        category: "Ropa",
        price: 152_000,
        description: "Pantalones deportivos con franjas doradas",
        features: &["Tela elástica", "Franjas doradas", "Bolsillos laterales"],
        bestseller: false,
    },
    Product {
        id: "product-13",
        name: "Multivitamínico Elite",
        category: "Suplementos",
        price: 100_000,
        description: "Complejo vitamínico completo para deportistas",
        features: &["Vitaminas y minerales", "Una cápsula diaria", "Apoyo al rendimiento"],
        bestseller: false,
    },
    Product {
        id: "product-14",
        name: "Top Deportivo Mujer",
        category: "Ropa",
        price: 112_000,
        description: "Top deportivo de alto soporte para mujer",
        features: &["Alto soporte", "Secado rápido", "Diseño ergonómico"],
        bestseller: false,
    },
    Product {
        id: "product-15",
        name: "Straps de Levantamiento",
        category: "Accesorios",
        price: 72_000,
        description: "Straps profesionales para levantamiento pesado",
        features: &["Algodón reforzado", "Agarre seguro", "Acolchado en muñeca"],
        bestseller: false,
    },
];

pub(super) static MEMBERSHIPS: &[Membership] = &[
    Membership {
        id: "membership-dia",
        name: "DÍA",
        tier: MembershipTier::Regular,
        price: 7_000,
        description: "Perfecto para probar nuestras instalaciones",
        features: &["Acceso al gimnasio por 1 día"],
        popular: false,
        purchasable: true,
    },
    Membership {
        id: "membership-semanal",
        name: "SEMANAL",
        tier: MembershipTier::Regular,
        price: 25_000,
        description: "Una semana completa de entrenamiento",
        features: &["Acceso al gimnasio por 7 días", "Jueves: Funcional", "Viernes: Rumba terapia"],
        popular: false,
        purchasable: true,
    },
    Membership {
        id: "membership-quincenal",
        name: "QUINCENAL",
        tier: MembershipTier::Regular,
        price: 47_000,
        description: "Dos semanas de entrenamiento intenso",
        features: &["Acceso al gimnasio por 15 días", "Jueves: Funcional", "Viernes: Rumba terapia"],
        popular: false,
        purchasable: true,
    },
    Membership {
        id: "membership-mensual",
        name: "MENSUAL",
        tier: MembershipTier::Regular,
        price: 65_000,
        description: "La opción más popular para resultados serios",
        features: &["Acceso al gimnasio todo el mes", "Jueves: Funcional", "Viernes: Rumba terapia"],
        popular: true,
        purchasable: true,
    },
    Membership {
        id: "membership-estudiante-quincenal",
        name: "QUINCENAL ESTUDIANTE",
        tier: MembershipTier::Student,
        price: 37_000,
        description: "Plan especial para estudiantes con carnet vigente",
        features: &[
            "Acceso al gimnasio por 15 días",
            "Jueves: Funcional",
            "Viernes: Rumba terapia",
            "Requiere carnet estudiantil",
        ],
        popular: false,
        purchasable: true,
    },
    Membership {
        id: "membership-estudiante-mensual",
        name: "MENSUAL ESTUDIANTE",
        tier: MembershipTier::Student,
        price: 60_000,
        description: "Plan mensual con descuento para estudiantes",
        features: &[
            "Acceso al gimnasio todo el mes",
            "Jueves: Funcional",
            "Viernes: Rumba terapia",
            "Requiere carnet estudiantil",
        ],
        popular: true,
        purchasable: true,
    },
    Membership {
        id: "membership-gratis",
        name: "DÍA GRATUITO",
        tier: MembershipTier::Special,
        price: 0,
        description: "Prueba nuestras instalaciones sin compromiso",
        features: &["Acceso al gimnasio por 1 día", "Conoce nuestras instalaciones"],
        popular: false,
        // booked by contacting the gym
        purchasable: false,
    },
    Membership {
        id: "membership-personalizado",
        name: "ENTRENAMIENTO PERSONALIZADO",
        tier: MembershipTier::Special,
        price: 300_000,
        description: "Máximo rendimiento con atención personalizada",
        features: &[
            "Todo lo del plan Mensual",
            "Entrenamiento personalizado",
            "Plan nutricional completo",
            "Evaluaciones mensuales",
            "Seguimiento personalizado",
        ],
        popular: false,
        purchasable: true,
    },
];
