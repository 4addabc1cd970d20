//! Static reference tables and lookups used by the schemas.
//!
//! Lookups never fail: unknown operating systems resolve to the Windows
//! entries and unknown traffic sources to the `direct` medium.

pub const OS_LIST: &[&str] = &["Android", "iOS", "Windows", "macOS"];

pub const GENDERS: &[&str] = &["male", "female"];

pub const PAGE_PATHS: &[&str] = &[
    "/",
    "/products",
    "/products/1",
    "/products/2",
    "/products/3",
    "/products/4",
    "/products/5",
    "/products/6",
    "/cart",
    "/checkout",
    "/checkout/success",
    "/wishlist",
    "/orders",
    "/login",
    "/register",
];

pub const PRODUCT_CATEGORIES: &[&str] = &[
    "electronics",
    "clothing",
    "sports",
    "home_living",
    "beauty",
    "books",
    "food",
    "furniture",
];

pub const PRODUCT_NAMES: &[&str] = &[
    "Wireless Bluetooth Earbuds",
    "Smartphone Case",
    "Cotton T-Shirt",
    "Running Shoes",
    "Coffee Machine",
    "Yoga Mat",
    "Laptop",
    "Smartwatch",
    "Headphones",
    "Tablet",
    "Jeans",
    "Hoodie",
    "Training Set",
    "Suit",
    "Dress",
    "Backpack",
    "Sneakers",
    "Coffee Beans",
    "Green Tea",
    "Fruit Box",
    "Mixed Nuts",
    "Cosmetics Set",
    "Perfume",
    "Skincare Kit",
];

pub const BUTTON_LABELS: &[&str] = &[
    "View Product",
    "Add to Cart",
    "Buy Now",
    "Add to Wishlist",
    "View Reviews",
    "Get Coupon",
    "Sign Up",
    "Log In",
    "Pay",
    "Confirm Order",
    "Track Delivery",
    "Request Refund",
    "Ask Question",
    "Write Review",
    "Rate Product",
];

pub const TRAFFIC_SOURCES: &[&str] = &[
    "google",
    "naver",
    "kakao",
    "facebook",
    "instagram",
    "youtube",
    "direct",
];

pub const UTM_CAMPAIGNS: &[&str] = &[
    "summer_sale_2024",
    "new_user_welcome",
    "black_friday",
    "christmas_sale",
    "spring_collection",
    "electronics_deal",
    "fashion_week",
    "beauty_campaign",
];

pub const UTM_CONTENT: &[&str] = &["banner", "text", "image", "video"];

pub const CITIES: &[&str] = &["Seoul", "Busan", "Incheon", "Daegu", "Daejeon", "Gwangju"];

pub const BROWSERS: &[&str] = &["Chrome", "Safari", "Firefox", "Edge"];

pub const PAYMENT_METHODS: &[&str] = &["card", "kakao_pay", "naver_pay", "bank_transfer"];

pub const SHIPPING_ADDRESSES: &[&str] = &[
    "Gangnam-gu, Seoul",
    "Seocho-gu, Seoul",
    "Mapo-gu, Seoul",
    "Haeundae-gu, Busan",
];

pub const SITE_TITLE: &str = "DEMO SHOP";

pub const COUNTRY: &str = "KR";
pub const TIMEZONE: &str = "Asia/Seoul";
pub const LANGUAGE: &str = "ko-KR";

pub fn page_title(path: &str) -> &'static str {
    match path {
        "/" => "DEMO SHOP - Marketplace",
        "/products" => "Products - DEMO SHOP",
        "/cart" => "Cart - DEMO SHOP",
        "/checkout" => "Checkout - DEMO SHOP",
        "/checkout/success" => "Order Complete - DEMO SHOP",
        "/wishlist" => "Wishlist - DEMO SHOP",
        "/orders" => "Orders - DEMO SHOP",
        "/login" => "Log In - DEMO SHOP",
        "/register" => "Sign Up - DEMO SHOP",
        _ => SITE_TITLE,
    }
}

pub fn referrer(source: &str) -> &'static str {
    match source {
        "google" => "https://www.google.com/",
        "naver" => "https://search.naver.com/",
        "kakao" => "https://search.kakao.com/",
        "facebook" => "https://www.facebook.com/",
        "instagram" => "https://www.instagram.com/",
        "youtube" => "https://www.youtube.com/",
        _ => "",
    }
}

pub fn traffic_medium(source: &str) -> &'static str {
    match source {
        "google" | "naver" | "kakao" => "organic",
        "facebook" | "instagram" | "youtube" => "social",
        _ => "direct",
    }
}

pub fn user_agent(os: &str) -> &'static str {
    match os {
        "macOS" => "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Android" => "Mozilla/5.0 (Linux; Android 13; SM-G991B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36",
        "iOS" => "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1.2 Mobile/15E148 Safari/604.1",
        _ => "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    }
}

pub fn screen_resolutions(os: &str) -> &'static [&'static str] {
    match os {
        "macOS" => &["2560x1600", "1920x1200", "1440x900"],
        "Android" => &["1080x2400", "720x1600", "1440x3200"],
        "iOS" => &["1170x2532", "1125x2436", "828x1792"],
        _ => &["1920x1080", "2560x1440", "1366x768"],
    }
}

pub fn viewport_sizes(os: &str) -> &'static [&'static str] {
    match os {
        "macOS" => &["1600x1000", "1200x750", "900x600"],
        "Android" => &["360x800", "412x915", "384x854"],
        "iOS" => &["390x844", "375x812", "414x896"],
        _ => &["1200x800", "1600x900", "1024x768"],
    }
}
