//! Interface labels in English and Arabic.

use clap::ValueEnum;

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Arabic, written right to left.
    Ar,
}

impl Language {
    /// Returns the two-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// Parses a two-letter code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::En),
            "ar" => Some(Self::Ar),
            _ => None,
        }
    }

    /// Returns the label table.
    #[must_use]
    pub const fn labels(self) -> &'static Labels {
        match self {
            Self::En => &EN,
            Self::Ar => &AR,
        }
    }
}

/// Text shown by the CLI.
#[derive(Debug)]
pub struct Labels {
    pub app_name: &'static str,
    pub tagline: &'static str,
    pub your_temp_email: &'static str,
    pub loading_email: &'static str,
    pub new_email: &'static str,
    pub copied: &'static str,
    pub inbox: &'static str,
    pub inbox_empty: &'static str,
    pub from: &'static str,
    pub to: &'static str,
    pub subject: &'static str,
    pub date: &'static str,
    pub attachments: &'static str,
    pub error: &'static str,
    pub retry_hint: &'static str,
    pub language_saved: &'static str,
}

static EN: Labels = Labels {
    app_name: "TempMailX",
    tagline: "Fast & Secure Temporary Email",
    your_temp_email: "Your Temporary Email Address",
    loading_email: "Generating your email...",
    new_email: "New Email",
    copied: "Copied!",
    inbox: "Inbox",
    inbox_empty: "Your inbox is empty. Waiting for new emails...",
    from: "From",
    to: "To",
    subject: "Subject",
    date: "Date",
    attachments: "Attachments",
    error: "Error",
    retry_hint: "Run `tempmailx new` to try again.",
    language_saved: "Language set to English",
};

static AR: Labels = Labels {
    app_name: "TempMailX",
    tagline: "بريد مؤقت سريع وآمن",
    your_temp_email: "عنوان بريدك المؤقت",
    loading_email: "جاري إنشاء بريدك الإلكتروني...",
    new_email: "بريد جديد",
    copied: "تم النسخ!",
    inbox: "صندوق الوارد",
    inbox_empty: "صندوق بريدك فارغ. في انتظار رسائل جديدة...",
    from: "من",
    to: "إلى",
    subject: "الموضوع",
    date: "التاريخ",
    attachments: "المرفقات",
    error: "خطأ",
    retry_hint: "شغّل `tempmailx new` للمحاولة مرة أخرى.",
    language_saved: "تم تعيين اللغة إلى العربية",
};
