pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

pub mod settings_defaults {

    pub const SITE_NAME: &str = "أعمالي بالطين";

    pub const SITE_DESCRIPTION: &str = "متجر متخصص في صناعة منتجات طين البوليمر اليدوية الفريدة";

    pub const BACKGROUND_COLOR: &str = "#6366f1";

    pub const SECONDARY_COLOR: &str = "#8b5cf6";

    pub const ACCENT_COLOR: &str = "#10b981";

    pub const THEME_STYLE: &str = "modern";

    pub const ABOUT_TEXT: &str = "مرحباً بكم في عالم الإبداع والفن اليدوي! نحن متخصصون في صناعة منتجات فريدة من طين البوليمر بأعلى معايير الجودة والإتقان. كل قطعة تُصنع بحب وعناية خاصة لتناسب ذوقكم المميز.";

    pub const FOOTER_TEXT: &str = "جميع الحقوق محفوظة";
}

pub mod messages {

    /// Prefix of the order message; the product name follows it.
    pub const PRODUCT_ORDER_PREFIX: &str = "مرحباً، أرغب في طلب منتج";

    pub const GENERIC_INQUIRY: &str = "مرحباً! أود الاستفسار عن منتجاتكم";

    pub const CUSTOM_ORDER: &str = "مرحباً! أود عمل طلب خاص:\n- نوع المنتج:\n- الألوان / التصميم:\n- الكمية:";

    pub const REVIEW_INVITATION: &str = "مرحباً! أود إرسال تقييم للمنتج الذي اشتريته";

    pub const MAINTENANCE: &str = "الموقع تحت الصيانة حالياً، يرجى العودة لاحقاً";
}

/// Category label the storefront uses for "every category".
pub const CATEGORY_ALL: &str = "الكل";

pub mod limits {

    pub const NAME_MAX_LEN: usize = 100;

    pub const CATEGORY_MAX_LEN: usize = 50;

    pub const USERNAME_MAX_LEN: usize = 80;

    pub const URL_MAX_LEN: usize = 200;

    pub const PHONE_MAX_LEN: usize = 20;

    pub const EMAIL_MAX_LEN: usize = 120;

    pub const RECENT_ITEMS: u64 = 5;

    pub const MAX_FEATURED_REVIEWS: u64 = 50;

    pub const PRODUCT_PAGE_SIZE: u64 = 20;

    pub const MAX_PRODUCT_PAGE_SIZE: u64 = 100;

    pub const SEARCH_MAX_LEN: usize = 100;

    pub const PRODUCT_REVIEWS: u64 = 5;
}
