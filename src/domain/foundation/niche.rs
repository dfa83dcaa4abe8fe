//! Niche enum representing the 10 business verticals of the game.
//!
//! Each niche carries bilingual labels and a short descriptor used when
//! parameterizing the assistant's persona. The full kiosk copy deck
//! (per-niche question scripts, icons) belongs to the UI layer and is
//! not part of this crate.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Language;

/// The 10 business verticals a visitor can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Niche {
    Restauration,
    Beaute,
    Construction,
    Immobilier,
    Sante,
    ServicesPro,
    MarketingWeb,
    Ecommerce,
    Coaching,
    ServicesDomicile,
}

impl Niche {
    /// Returns all niches in catalog order.
    pub fn all() -> &'static [Niche] {
        &[
            Niche::Restauration,
            Niche::Beaute,
            Niche::Construction,
            Niche::Immobilier,
            Niche::Sante,
            Niche::ServicesPro,
            Niche::MarketingWeb,
            Niche::Ecommerce,
            Niche::Coaching,
            Niche::ServicesDomicile,
        ]
    }

    /// Returns the wire name (matches the JSON representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            Niche::Restauration => "restauration",
            Niche::Beaute => "beaute",
            Niche::Construction => "construction",
            Niche::Immobilier => "immobilier",
            Niche::Sante => "sante",
            Niche::ServicesPro => "services_pro",
            Niche::MarketingWeb => "marketing_web",
            Niche::Ecommerce => "ecommerce",
            Niche::Coaching => "coaching",
            Niche::ServicesDomicile => "services_domicile",
        }
    }

    /// Returns the human-readable label in the given language.
    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (Niche::Restauration, Language::Fr) => "Restauration",
            (Niche::Restauration, Language::En) => "Restaurant / Food Service",
            (Niche::Beaute, Language::Fr) => "Beauté & Coiffure",
            (Niche::Beaute, Language::En) => "Beauty & Hair",
            (Niche::Construction, Language::Fr) => "Construction & Rénovation",
            (Niche::Construction, Language::En) => "Construction & Renovation",
            (Niche::Immobilier, Language::Fr) => "Immobilier",
            (Niche::Immobilier, Language::En) => "Real Estate",
            (Niche::Sante, Language::Fr) => "Santé & Bien-être",
            (Niche::Sante, Language::En) => "Health & Wellness",
            (Niche::ServicesPro, Language::Fr) => "Services Professionnels",
            (Niche::ServicesPro, Language::En) => "Professional Services",
            (Niche::MarketingWeb, Language::Fr) => "Marketing & Web",
            (Niche::MarketingWeb, Language::En) => "Marketing & Web",
            (Niche::Ecommerce, Language::Fr) => "E-commerce & Boutiques",
            (Niche::Ecommerce, Language::En) => "E-commerce & Retail",
            (Niche::Coaching, Language::Fr) => "Coaching & Formation",
            (Niche::Coaching, Language::En) => "Coaching & Training",
            (Niche::ServicesDomicile, Language::Fr) => "Services à Domicile",
            (Niche::ServicesDomicile, Language::En) => "Home Services",
        }
    }

    /// Returns a short descriptor of the businesses in this vertical.
    pub fn descriptor(&self, language: Language) -> &'static str {
        match (self, language) {
            (Niche::Restauration, Language::Fr) => "Restaurants, traiteurs, food trucks, cafés",
            (Niche::Restauration, Language::En) => "Restaurants, caterers, food trucks, cafés",
            (Niche::Beaute, Language::Fr) => "Salons de coiffure, esthétique, spas, barbiers",
            (Niche::Beaute, Language::En) => "Hair salons, esthetics, spas, barbers",
            (Niche::Construction, Language::Fr) => {
                "Entrepreneurs généraux, rénovation, toiture, plomberie"
            }
            (Niche::Construction, Language::En) => {
                "General contractors, renovation, roofing, plumbing"
            }
            (Niche::Immobilier, Language::Fr) => {
                "Courtiers immobiliers, gestion locative, investissement"
            }
            (Niche::Immobilier, Language::En) => {
                "Real estate brokers, rental management, investment"
            }
            (Niche::Sante, Language::Fr) => {
                "Cliniques, massothérapeutes, nutritionnistes, psychologues"
            }
            (Niche::Sante, Language::En) => {
                "Clinics, massage therapists, nutritionists, psychologists"
            }
            (Niche::ServicesPro, Language::Fr) => "Comptables, avocats, notaires, consultants",
            (Niche::ServicesPro, Language::En) => "Accountants, lawyers, notaries, consultants",
            (Niche::MarketingWeb, Language::Fr) => {
                "Agences marketing, design web, SEO, réseaux sociaux"
            }
            (Niche::MarketingWeb, Language::En) => {
                "Marketing agencies, web design, SEO, social media"
            }
            (Niche::Ecommerce, Language::Fr) => {
                "Boutiques en ligne, Shopify, vente au détail locale"
            }
            (Niche::Ecommerce, Language::En) => "Online stores, Shopify, local retail",
            (Niche::Coaching, Language::Fr) => {
                "Coaches de vie, formateurs, mentors, conférenciers"
            }
            (Niche::Coaching, Language::En) => "Life coaches, trainers, mentors, speakers",
            (Niche::ServicesDomicile, Language::Fr) => {
                "Ménage, entretien, paysagisme, déménagement"
            }
            (Niche::ServicesDomicile, Language::En) => {
                "Cleaning, maintenance, landscaping, moving"
            }
        }
    }
}

impl fmt::Display for Niche {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
