pub struct BookContent {
    pub title: &'static str,
    pub title_ar: &'static str,
    pub author: &'static str,
    pub copies: i32,
}

const fn b(title: &'static str, title_ar: &'static str, author: &'static str, copies: i32) -> BookContent {
    BookContent { title, title_ar, author, copies }
}

pub static BOOKS: &[BookContent] = &[
    b("The Prophet", "النبي", "Kahlil Gibran", 3),
    b("Season of Migration to the North", "موسم الهجرة إلى الشمال", "Tayeb Salih", 2),
    b("Cities of Salt", "مدن الملح", "Abdul Rahman Munif", 2),
    b("The Days", "الأيام", "Taha Hussein", 4),
    b("Palace Walk", "بين القصرين", "Naguib Mahfouz", 2),
    b("Kalila and Dimna", "كليلة ودمنة", "Ibn al-Muqaffa", 5),
    b("The Muqaddimah", "المقدمة", "Ibn Khaldun", 2),
    b("Treasure Island", "جزيرة الكنز", "Robert Louis Stevenson", 3),
    b("The Little Prince", "الأمير الصغير", "Antoine de Saint-Exupery", 6),
    b("Charlotte's Web", "شبكة شارلوت", "E. B. White", 4),
    b("A Brief History of Time", "تاريخ موجز للزمن", "Stephen Hawking", 2),
    b("The Travels of Ibn Battuta", "رحلة ابن بطوطة", "Ibn Battuta", 3),
    b("Hayy ibn Yaqdhan", "حي بن يقظان", "Ibn Tufail", 3),
    b("Robinson Crusoe", "روبنسون كروزو", "Daniel Defoe", 3),
    b("Around the World in Eighty Days", "حول العالم في ثمانين يوما", "Jules Verne", 4),
    b("The Book of Healing", "كتاب الشفاء", "Ibn Sina", 1),
];
