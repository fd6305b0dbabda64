use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::i18n;
use crate::models::draft::{price_range_error, ServiceDraft};
use crate::models::localized::Locale;

pub type FieldErrors = BTreeMap<String, String>;

pub fn validate(draft: &ServiceDraft, for_publish: bool, locale: Locale) -> FieldErrors {
    if !for_publish {
        return FieldErrors::new();
    }

    let mut errors = match draft.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errs) => collapse(&errs, locale),
    };

    if let (Some(min), Some(max)) = (draft.price_min_minor, draft.price_max_minor) {
        if max < min && !errors.contains_key("price_max_minor") {
            let err = price_range_error();
            errors.insert("price_max_minor".to_string(), message_for(&err, locale));
        }
    }

    errors
}

/// Keeps the first reported error of each field. Field rules are ordered from
/// most to least specific. Nested errors are keyed `extras.0.price_minor`.
fn collapse(errors: &ValidationErrors, locale: Locale) -> FieldErrors {
    let mut out = FieldErrors::new();
    collapse_into("", errors, locale, &mut out);
    out
}

fn collapse_into(prefix: &str, errors: &ValidationErrors, locale: Locale, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let key = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                if let Some(err) = errs.first() {
                    out.insert(key, message_for(err, locale));
                }
            }
            ValidationErrorsKind::Struct(nested) => collapse_into(&key, nested, locale, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collapse_into(&format!("{}.{}", key, index), nested, locale, out);
                }
            }
        }
    }
}

fn message_for(err: &validator::ValidationError, locale: Locale) -> String {
    match &err.message {
        Some(key) => i18n::translate(locale, key),
        None => format!("invalid value ({})", err.code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::draft::LocationType;

    fn publishable() -> ServiceDraft {
        ServiceDraft {
            title: "Professional logo design".into(),
            short_description: "Logos that last".into(),
            description: "Three concepts, vector files included.".into(),
            base_price_minor: 15_000,
            cover_image: Some("https://cdn.test/cover.jpg".into()),
            categories: vec!["design".into()],
            location_type: vec![LocationType::Remote],
            ..Default::default()
        }
    }

    #[test]
    fn publishable_draft_has_no_errors() {
        assert!(validate(&publishable(), true, Locale::En).is_empty());
    }

    #[test]
    fn draft_saves_skip_validation() {
        assert!(validate(&ServiceDraft::default(), false, Locale::En).is_empty());
    }

    #[test]
    fn reports_cover_and_categories_but_not_a_valid_title() {
        let draft = ServiceDraft {
            title: "Web Design Service".into(),
            short_description: "I build sites".into(),
            base_price_minor: 10_000,
            display_currency: "EUR".into(),
            cover_image: None,
            categories: vec![],
            ..Default::default()
        };

        let errors = validate(&draft, true, Locale::En);
        assert_eq!(errors["cover_image"], "A cover image is required");
        assert_eq!(errors["categories"], "Select at least one category");
        assert!(!errors.contains_key("title"));
    }

    #[test]
    fn title_reports_single_most_specific_message() {
        let mut draft = publishable();
        draft.title = String::new();
        let errors = validate(&draft, true, Locale::En);
        assert_eq!(errors["title"], "Title is required");

        draft.title = "Too short".into();
        let errors = validate(&draft, true, Locale::En);
        assert_eq!(
            errors["title"],
            "Title must be between 10 and 120 characters"
        );

        draft.title = "x".repeat(121);
        assert!(validate(&draft, true, Locale::En).contains_key("title"));
    }

    #[test]
    fn price_ordering() {
        let mut draft = publishable();
        draft.price_min_minor = Some(5_000);
        draft.price_max_minor = Some(3_000);
        let errors = validate(&draft, true, Locale::En);
        assert!(errors.contains_key("price_max_minor"));
        assert_eq!(errors.len(), 1);

        draft.price_min_minor = Some(3_000);
        draft.price_max_minor = Some(5_000);
        assert!(validate(&draft, true, Locale::En).is_empty());
    }

    #[test]
    fn enforces_enumerated_and_bounded_fields() {
        let mut draft = publishable();
        draft.delivery_time_days = 4;
        draft.revisions_included = 11;
        draft.short_description = "a".repeat(151);
        draft.location_type.clear();
        draft.description = "   ".into();

        let errors = validate(&draft, true, Locale::Fr);
        assert_eq!(
            errors["delivery_time_days"],
            "Veuillez choisir un délai de livraison valide"
        );
        assert!(errors.contains_key("revisions_included"));
        assert!(errors.contains_key("short_description"));
        assert!(errors.contains_key("location_type"));
        assert_eq!(errors["description"], "La description est obligatoire");
    }

    #[test]
    fn negative_extra_price_is_reported() {
        let mut draft = publishable();
        draft.extras.push(crate::models::draft::Extra {
            title: "Rush".into(),
            price_minor: -5_000,
            additional_days: 0,
        });
        let errors = validate(&draft, true, Locale::En);
        assert_eq!(errors["extras.0.price_minor"], "Price cannot be negative");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn validation_is_idempotent() {
        let draft = ServiceDraft::default();
        let first = validate(&draft, true, Locale::En);
        let second = validate(&draft, true, Locale::En);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
