//! Multi-language place-type classification of free-text context labels.
//!
//! The context label attached to a coordinate (a landmark or chapter name)
//! hints at what kind of place it is, which in turn tunes how much
//! positional disagreement the resolver tolerates: transport hubs are large
//! polygons, tourist landmarks are points. Keywords cover seven languages
//! so the heuristic works on unlocalized upstream content.

/// Per-category scores in `[0, 1]`. All zeros means "generic place" and the
/// threshold calculator applies no category adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaceTypeScores {
    pub tourism: f64,
    pub commercial: f64,
    pub transport: f64,
}

/// Score contributed by each matched keyword, capped at 1.0 per category.
const KEYWORD_WEIGHT: f64 = 0.2;

/// Tourism / landmark keywords (ko, en, ja, fr, es, de, it).
const TOURISM_KEYWORDS: &[&str] = &[
    // Korean
    "궁", "절", "박물관", "공원", "관광", "유적", "문화재", "성당", "교회",
    // English
    "palace", "temple", "museum", "park", "tourist", "historic", "cathedral", "church",
    "monument",
    // Japanese
    "宮", "寺", "博物館", "公園", "観光", "史跡", "教会",
    // French
    "palais", "musée", "parc", "touristique", "historique", "cathédrale",
    // Spanish
    "palacio", "templo", "museo", "parque", "turístico", "histórico", "catedral",
    // German
    "palast", "tempel", "touristisch", "historisch", "kathedrale",
    // Italian
    "palazzo", "tempio", "parco", "turistico", "storico", "cattedrale",
];

/// Commercial keywords (cafes, restaurants, shops, malls).
const COMMERCIAL_KEYWORDS: &[&str] = &[
    // Korean
    "카페", "음식점", "상점", "마트", "백화점", "쇼핑몰",
    // English
    "cafe", "restaurant", "shop", "store", "mall", "shopping", "market",
    // Japanese
    "カフェ", "レストラン", "ショップ", "モール",
    // French
    "café", "magasin", "boutique", "centre commercial",
    // Spanish
    "restaurante", "tienda", "centro comercial", "mercado",
    // German
    "geschäft", "einkaufszentrum", "markt",
    // Italian
    "caffè", "ristorante", "negozio", "centro commerciale", "mercato",
];

/// Transport keywords (stations, airports, terminals, ports).
const TRANSPORT_KEYWORDS: &[&str] = &[
    // Korean
    "역", "공항", "터미널", "정류장", "항구",
    // English
    "station", "airport", "terminal", "stop", "port", "harbor",
    // Japanese
    "駅", "空港", "ターミナル", "停留所", "港",
    // French
    "gare", "aéroport", "arrêt",
    // Spanish
    "estación", "aeropuerto", "parada", "puerto",
    // German
    "bahnhof", "flughafen", "haltestelle", "hafen",
    // Italian
    "stazione", "aeroporto", "terminale", "fermata", "porto",
];

/// Classifies a free-text context label into place-type category scores.
///
/// Case-insensitive substring matching; each matched keyword adds 0.2 to
/// its category, capped at 1.0. Degrades gracefully: an unrecognized label
/// scores zero everywhere.
#[must_use]
pub fn classify(context: &str) -> PlaceTypeScores {
    let context = context.to_lowercase();
    PlaceTypeScores {
        tourism: category_score(&context, TOURISM_KEYWORDS),
        commercial: category_score(&context, COMMERCIAL_KEYWORDS),
        transport: category_score(&context, TRANSPORT_KEYWORDS),
    }
}

fn category_score(context: &str, keywords: &[&str]) -> f64 {
    let matches = keywords
        .iter()
        .filter(|keyword| context.contains(&keyword.to_lowercase()))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let raw = matches as f64 * KEYWORD_WEIGHT;
    raw.min(1.0)
}
