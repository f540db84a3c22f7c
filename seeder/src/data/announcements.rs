use db::models::announcement::Audience;

pub struct AnnouncementContent {
    pub title: &'static str,
    pub title_ar: &'static str,
    pub body: &'static str,
    pub body_ar: &'static str,
    pub audience: Audience,
    /// Days after the school year starts.
    pub day_offset: i64,
}

pub static ANNOUNCEMENTS: &[AnnouncementContent] = &[
    AnnouncementContent {
        title: "Welcome Back to School",
        title_ar: "مرحبا بعودتكم إلى المدرسة",
        body: "We are delighted to welcome all students and families to the new academic year.",
        body_ar: "يسعدنا أن نرحب بجميع الطلاب وأسرهم في العام الدراسي الجديد.",
        audience: Audience::Everyone,
        day_offset: 0,
    },
    AnnouncementContent {
        title: "Staff Orientation Week",
        title_ar: "أسبوع توجيه الموظفين",
        body: "All staff are asked to attend the orientation sessions in the main hall.",
        body_ar: "نرجو من جميع الموظفين حضور جلسات التوجيه في القاعة الرئيسية.",
        audience: Audience::Staff,
        day_offset: 2,
    },
    AnnouncementContent {
        title: "First Term Fees Due",
        title_ar: "موعد سداد رسوم الفصل الأول",
        body: "Invoices for the first term have been issued and are due within two weeks.",
        body_ar: "تم إصدار فواتير الفصل الدراسي الأول ويجب سدادها خلال أسبوعين.",
        audience: Audience::Guardians,
        day_offset: 7,
    },
    AnnouncementContent {
        title: "Library Reading Challenge",
        title_ar: "تحدي القراءة في المكتبة",
        body: "Borrow five books this term and join the school reading challenge.",
        body_ar: "استعر خمسة كتب هذا الفصل وشارك في تحدي القراءة المدرسي.",
        audience: Audience::Students,
        day_offset: 14,
    },
    AnnouncementContent {
        title: "National Day Celebration",
        title_ar: "الاحتفال باليوم الوطني",
        body: "Classes will end early on National Day for the school celebration.",
        body_ar: "ستنتهي الحصص مبكرا في اليوم الوطني للاحتفال المدرسي.",
        audience: Audience::Everyone,
        day_offset: 21,
    },
    AnnouncementContent {
        title: "Parent-Teacher Meetings",
        title_ar: "لقاءات أولياء الأمور والمعلمين",
        body: "Meetings with homeroom teachers will be held at the end of the month.",
        body_ar: "ستعقد اللقاءات مع معلمي الفصول في نهاية الشهر.",
        audience: Audience::Guardians,
        day_offset: 45,
    },
];
