//! Static marketing content for the public pages.
//!
//! Everything the business edits in code rather than in the admin screens:
//! hero copy, services, the ordering steps, headline stats, and contact
//! details.

/// Business name shown in the header, footer, and page titles.
pub const BUSINESS_NAME: &str = "Premium Food Ventures";

/// Hero content.
pub struct Hero {
    pub title: &'static str,
    pub tagline: &'static str,
    pub subtitle: &'static str,
}

pub const HERO: Hero = Hero {
    title: "Premium Quality, Unbeatable Freshness",
    tagline: "...its premium services or nothing",
    subtitle: "Fresh. Premium. Delivered.",
};

/// A titled blurb, used for services and ordering steps.
pub struct Blurb {
    pub title: &'static str,
    pub description: &'static str,
}

pub const SERVICES: [Blurb; 3] = [
    Blurb {
        title: "Fresh Fish",
        description: "High-quality, fresh fish delivered to your doorstep.",
    },
    Blurb {
        title: "Premium Chicken",
        description: "Tender, juicy, and ethically raised premium chicken.",
    },
    Blurb {
        title: "Home Delivery",
        description: "Fast and reliable delivery service across Kano.",
    },
];

pub const HOW_IT_WORKS: [Blurb; 3] = [
    Blurb {
        title: "Place Your Order",
        description: "Browse our products and place your order online or via WhatsApp.",
    },
    Blurb {
        title: "We Prepare Your Package",
        description: "We carefully select and prepare your premium products.",
    },
    Blurb {
        title: "Fast Delivery",
        description: "Your order is delivered to your doorstep within 24 hours.",
    },
];

/// A headline number in the "Why Choose Us" section.
pub struct Stat {
    pub value: u32,
    pub suffix: &'static str,
    pub label: &'static str,
}

pub const STATS: [Stat; 3] = [
    Stat {
        value: 500,
        suffix: "+",
        label: "Happy Customers",
    },
    Stat {
        value: 100,
        suffix: "%",
        label: "Fresh Products",
    },
    Stat {
        value: 24,
        suffix: "hr",
        label: "Hour Delivery",
    },
];

/// A phone line, as displayed and as dialled.
pub struct Phone {
    pub display: &'static str,
    pub tel: &'static str,
}

/// How to reach the business.
pub struct Contact {
    pub address: &'static str,
    pub phones: [Phone; 2],
    /// WhatsApp chat used for orders.
    pub whatsapp_orders: &'static str,
    /// WhatsApp chat linked from the header and hero.
    pub whatsapp_enquiries: &'static str,
}

pub const CONTACT: Contact = Contact {
    address: "Plot 48119 Malum Sufyan Street, Dantulse Ward, Tarauni L.G.A, Kano, Nigeria",
    phones: [
        Phone {
            display: "0815 8998 166",
            tel: "08158998166",
        },
        Phone {
            display: "0803 4304 820",
            tel: "08034304820",
        },
    ],
    whatsapp_orders: "https://wa.me/2348034384620",
    whatsapp_enquiries: "https://wa.me/2348158998166",
};
