//! Built-in sample questions, used when AI query generation is unavailable.

/// Industry buckets that have a sample question set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndustryBucket {
    Supplements,
    Ecommerce,
    Saas,
    Finance,
}

impl IndustryBucket {
    /// Buckets a free-text industry label; anything unrecognized falls back
    /// to supplements.
    fn from_label(industry: &str) -> Self {
        let lower = industry.to_lowercase();
        if lower.contains("supplement") {
            Self::Supplements
        } else if lower.contains("commerce") {
            Self::Ecommerce
        } else if lower.contains("saas") || lower.contains("software") {
            Self::Saas
        } else if lower.contains("finance") || lower.contains("banking") {
            Self::Finance
        } else {
            Self::Supplements
        }
    }
}

struct LanguageSamples {
    supplements: &'static [&'static str],
    ecommerce: &'static [&'static str],
    saas: &'static [&'static str],
    finance: &'static [&'static str],
}

impl LanguageSamples {
    fn bucket(&self, bucket: IndustryBucket) -> &'static [&'static str] {
        match bucket {
            IndustryBucket::Supplements => self.supplements,
            IndustryBucket::Ecommerce => self.ecommerce,
            IndustryBucket::Saas => self.saas,
            IndustryBucket::Finance => self.finance,
        }
    }
}

static DE: LanguageSamples = LanguageSamples {
    supplements: &[
        "Was sind die besten Vitamin D Nahrungsergänzungsmittel in Deutschland?",
        "Vergleiche natürliche Nahrungsergänzungsmittel Marken für Qualität",
        "Welches Magnesium hilft beim Schlafen?",
        "Beste Bio-Vitamin Marken in Europa",
        "Wie wählt man hochwertige Nahrungsergänzungsmittel aus?",
        "Top bewertete Multivitamin Marken",
        "Natürliche vs synthetische Vitamine - was ist besser?",
        "Beste Nahrungsergänzungsmittel für Energie und gegen Müdigkeit",
        "Empfohlene B12 Supplements für Veganer",
        "Qualitätskriterien für Supplement Marken",
    ],
    ecommerce: &[
        "Beste Online-Shopping Seiten in Deutschland",
        "Vertrauenswürdigste E-Commerce Plattformen",
        "Wo kann man Elektronik online kaufen?",
        "Beste Kundenservice Online-Shops",
        "Vergleiche Online-Marktplätze",
    ],
    saas: &[
        "Beste Projektmanagement-Tools für Teams",
        "Vergleiche CRM Software Lösungen",
        "Top Produktivitäts-Apps für Unternehmen",
        "Beste Collaboration Tools für Remote Work",
        "Günstige SaaS für Startups",
    ],
    finance: &[
        "Beste Investmentplattformen in Europa",
        "Vergleiche Banking Apps",
        "Top Fintech Unternehmen",
        "Beste Budgeting Apps",
        "Vertrauenswürdige Trading Plattformen",
    ],
};

static EN: LanguageSamples = LanguageSamples {
    supplements: &[
        "What are the best vitamin D supplements in Germany?",
        "Compare natural supplement brands for quality",
        "Which magnesium supplements help with sleep?",
        "Best organic vitamin brands in Europe",
        "How to choose high-quality supplements?",
        "Top rated multivitamin brands",
        "Natural vs synthetic vitamins - which is better?",
        "Best supplements for energy and fatigue",
        "Recommended B12 supplements for vegans",
        "Quality criteria for supplement brands",
    ],
    ecommerce: &[
        "Best online shopping sites in Germany",
        "Most trusted e-commerce platforms",
        "Where to buy electronics online?",
        "Best customer service online stores",
        "Compare online marketplaces",
    ],
    saas: &[
        "Best project management tools for teams",
        "Compare CRM software solutions",
        "Top productivity apps for business",
        "Best collaboration tools for remote work",
        "Affordable SaaS for startups",
    ],
    finance: &[
        "Best investment platforms in Europe",
        "Compare banking apps",
        "Top fintech companies",
        "Best budgeting apps",
        "Trusted trading platforms",
    ],
};

static FR: LanguageSamples = LanguageSamples {
    supplements: &[
        "Quels sont les meilleurs compléments de vitamine D en France?",
        "Comparer les marques de compléments alimentaires naturels",
        "Quel magnésium aide à dormir?",
        "Meilleures marques de vitamines bio en Europe",
        "Comment choisir des compléments de qualité?",
        "Meilleures marques de multivitamines",
        "Vitamines naturelles vs synthétiques - lequel est meilleur?",
        "Meilleurs compléments pour l'énergie et la fatigue",
        "Compléments B12 recommandés pour les végétaliens",
        "Critères de qualité pour les marques de compléments",
    ],
    ecommerce: &[
        "Meilleurs sites d'achat en ligne en France",
        "Plateformes e-commerce les plus fiables",
        "Où acheter de l'électronique en ligne?",
        "Meilleur service client des boutiques en ligne",
        "Comparer les marketplaces en ligne",
    ],
    saas: &[
        "Meilleurs outils de gestion de projet pour équipes",
        "Comparer les solutions CRM",
        "Top applications de productivité pour entreprises",
        "Meilleurs outils de collaboration pour le télétravail",
        "SaaS abordable pour startups",
    ],
    finance: &[
        "Meilleures plateformes d'investissement en Europe",
        "Comparer les applications bancaires",
        "Top entreprises fintech",
        "Meilleures applications de budget",
        "Plateformes de trading fiables",
    ],
};

static ES: LanguageSamples = LanguageSamples {
    supplements: &[
        "¿Cuáles son los mejores suplementos de vitamina D en España?",
        "Comparar marcas de suplementos naturales por calidad",
        "¿Qué magnesio ayuda a dormir?",
        "Mejores marcas de vitaminas orgánicas en Europa",
        "¿Cómo elegir suplementos de alta calidad?",
        "Marcas de multivitaminas mejor valoradas",
        "Vitaminas naturales vs sintéticas - ¿cuál es mejor?",
        "Mejores suplementos para energía y fatiga",
        "Suplementos B12 recomendados para veganos",
        "Criterios de calidad para marcas de suplementos",
    ],
    ecommerce: &[
        "Mejores sitios de compras en línea en España",
        "Plataformas de e-commerce más confiables",
        "¿Dónde comprar electrónica online?",
        "Mejor servicio al cliente tiendas online",
        "Comparar marketplaces online",
    ],
    saas: &[
        "Mejores herramientas de gestión de proyectos para equipos",
        "Comparar soluciones CRM",
        "Top apps de productividad para empresas",
        "Mejores herramientas de colaboración para trabajo remoto",
        "SaaS asequible para startups",
    ],
    finance: &[
        "Mejores plataformas de inversión en Europa",
        "Comparar apps bancarias",
        "Top empresas fintech",
        "Mejores apps de presupuesto",
        "Plataformas de trading confiables",
    ],
};

static IT: LanguageSamples = LanguageSamples {
    supplements: &[
        "Quali sono i migliori integratori di vitamina D in Italia?",
        "Confronta marche di integratori naturali per qualità",
        "Quale magnesio aiuta a dormire?",
        "Migliori marche di vitamine bio in Europa",
        "Come scegliere integratori di alta qualità?",
        "Marche di multivitaminici più votate",
        "Vitamine naturali vs sintetiche - qual è meglio?",
        "Migliori integratori per energia e stanchezza",
        "Integratori B12 consigliati per vegani",
        "Criteri di qualità per marche di integratori",
    ],
    ecommerce: &[
        "Migliori siti di shopping online in Italia",
        "Piattaforme e-commerce più affidabili",
        "Dove comprare elettronica online?",
        "Miglior servizio clienti negozi online",
        "Confronta marketplace online",
    ],
    saas: &[
        "Migliori strumenti di project management per team",
        "Confronta soluzioni CRM",
        "Top app di produttività per aziende",
        "Migliori strumenti di collaborazione per lavoro remoto",
        "SaaS conveniente per startup",
    ],
    finance: &[
        "Migliori piattaforme di investimento in Europa",
        "Confronta app bancarie",
        "Top aziende fintech",
        "Migliori app di budget",
        "Piattaforme di trading affidabili",
    ],
};

/// Returns the sample questions for an industry label and language code.
///
/// Unrecognized industries use the supplements set; unsupported languages
/// fall back to English.
#[must_use]
pub fn sample_queries_for_industry(industry: &str, language: &str) -> &'static [&'static str] {
    let samples = match language.to_lowercase().as_str() {
        "de" => &DE,
        "fr" => &FR,
        "es" => &ES,
        "it" => &IT,
        _ => &EN,
    };
    samples.bucket(IndustryBucket::from_label(industry))
}
