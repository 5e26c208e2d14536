//! User-facing messages, one catalog per supported locale.

/// Language of the messages put into response bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Locale {
    #[default]
    En,
    Ru,
}

/// Every message a response body can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Message {
    NotFound,
    MissingFields,
    InvalidFields,
    IdRequired,
    IdParamRequired,
    InvalidId,
    InvalidBody,
    NoFieldsToUpdate,
    Deleted,
    MethodNotAllowed,
    NotConfigured,
}

impl Locale {
    /// Parse a locale tag such as `en`, `ru` or `ru-RU`.
    pub(crate) fn parse(tag: &str) -> Option<Self> {
        let language = tag.split(['-', '_']).next().unwrap_or_default();
        match language.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "ru" => Some(Locale::Ru),
            _ => None,
        }
    }

    pub(crate) fn text(self, message: Message) -> &'static str {
        match self {
            Locale::En => match message {
                Message::NotFound => "Skin not found",
                Message::MissingFields => "Missing required fields",
                Message::InvalidFields => "Invalid or missing fields",
                Message::IdRequired | Message::IdParamRequired => "Skin ID required",
                Message::InvalidId => "Skin ID must be an integer",
                Message::InvalidBody => "Invalid request body",
                Message::NoFieldsToUpdate => "No fields to update",
                Message::Deleted => "Skin deleted",
                Message::MethodNotAllowed => "Method not allowed",
                Message::NotConfigured => "DATABASE_URL not configured",
            },
            Locale::Ru => match message {
                Message::NotFound => "Скин не найден",
                Message::MissingFields => "Необходимы поля: name, weapon, rarity, price",
                Message::InvalidFields => "Некорректные или отсутствующие поля",
                Message::IdRequired => "Необходимо поле id",
                Message::IdParamRequired => "Необходим параметр id",
                Message::InvalidId => "Параметр id должен быть целым числом",
                Message::InvalidBody => "Некорректное тело запроса",
                Message::NoFieldsToUpdate => "Нет полей для обновления",
                Message::Deleted => "Скин удален",
                Message::MethodNotAllowed => "Метод не поддерживается",
                Message::NotConfigured => "DATABASE_URL не настроен",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locale_tags() {
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse("RU"), Some(Locale::Ru));
        assert_eq!(Locale::parse("ru_RU"), Some(Locale::Ru));
        assert_eq!(Locale::parse("de"), None);
        assert_eq!(Locale::parse(""), None);
    }

    #[test]
    fn not_found_message_mentions_not_found() {
        assert!(Locale::En.text(Message::NotFound).ends_with("not found"));
        assert_eq!(Locale::Ru.text(Message::NotFound), "Скин не найден");
    }

    #[test]
    fn query_and_body_id_messages_differ_only_in_russian() {
        assert_eq!(
            Locale::En.text(Message::IdRequired),
            Locale::En.text(Message::IdParamRequired)
        );
        assert_ne!(
            Locale::Ru.text(Message::IdRequired),
            Locale::Ru.text(Message::IdParamRequired)
        );
    }
}
