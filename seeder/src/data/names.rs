pub struct PersonName {
    pub en: &'static str,
    pub ar: &'static str,
}

const fn n(en: &'static str, ar: &'static str) -> PersonName {
    PersonName { en, ar }
}

pub static MALE_NAMES: &[PersonName] = &[
    n("Abdullah", "عبدالله"),
    n("Mohammed", "محمد"),
    n("Fahad", "فهد"),
    n("Khalid", "خالد"),
    n("Saud", "سعود"),
    n("Omar", "عمر"),
    n("Yousef", "يوسف"),
    n("Turki", "تركي"),
    n("Ibrahim", "إبراهيم"),
    n("Hamad", "حمد"),
    n("Nasser", "ناصر"),
    n("Ziyad", "زياد"),
    n("Rayan", "ريان"),
    n("Bandar", "بندر"),
];

pub static FEMALE_NAMES: &[PersonName] = &[
    n("Noura", "نورة"),
    n("Sara", "سارة"),
    n("Lama", "لمى"),
    n("Aljawhara", "الجوهرة"),
    n("Maha", "مها"),
    n("Reem", "ريم"),
    n("Layan", "ليان"),
    n("Joud", "جود"),
    n("Hessa", "حصة"),
    n("Dana", "دانة"),
    n("Shahad", "شهد"),
    n("Ghada", "غادة"),
    n("Amal", "أمل"),
];

pub static FAMILY_NAMES: &[PersonName] = &[
    n("Al-Ghamdi", "الغامدي"),
    n("Al-Zahrani", "الزهراني"),
    n("Al-Shammari", "الشمري"),
    n("Al-Anazi", "العنزي"),
    n("Al-Subaie", "السبيعي"),
    n("Al-Malki", "المالكي"),
    n("Al-Juhani", "الجهني"),
    n("Al-Rashidi", "الرشيدي"),
    n("Al-Harthi", "الحارثي"),
    n("Al-Omari", "العمري"),
    n("Al-Yami", "اليامي"),
];
