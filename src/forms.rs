//! Form sanitization and validation.
//!
//! Rules are declared as an ordered list of (field, rule, message) records and
//! evaluated by a single pass that collects every failure instead of stopping
//! at the first one, so a submission can report several errors at once.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    NotEmpty,
    /// Any numeric content, fractional allowed.
    Numeric,
    /// Whole numbers only.
    Integer,
    /// Inclusive bounds, applied to the parsed number.
    Range { min: f64, max: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

pub const CATEGORY_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        rule: Rule::NotEmpty,
        message: "Name must not be empty",
    },
    FieldRule {
        field: "description",
        rule: Rule::NotEmpty,
        message: "Description must not be empty",
    },
];

pub const ITEM_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        rule: Rule::NotEmpty,
        message: "Name must not be empty",
    },
    FieldRule {
        field: "description",
        rule: Rule::NotEmpty,
        message: "Description must not be empty",
    },
    FieldRule {
        field: "category",
        rule: Rule::NotEmpty,
        message: "Category must not be empty",
    },
    FieldRule {
        field: "price",
        rule: Rule::NotEmpty,
        message: "Price must not be empty",
    },
    FieldRule {
        field: "price",
        rule: Rule::Numeric,
        message: "Price must be a number",
    },
    FieldRule {
        field: "price",
        rule: Rule::Range {
            min: 0.0,
            max: 1000.0,
        },
        message: "Price must be between 0 and 1000",
    },
    FieldRule {
        field: "stock",
        rule: Rule::NotEmpty,
        message: "Number in stock must not be empty",
    },
    FieldRule {
        field: "stock",
        rule: Rule::Integer,
        message: "Number in stock must be a number",
    },
    FieldRule {
        field: "stock",
        rule: Rule::Range {
            min: 0.0,
            max: 1000.0,
        },
        message: "Number in stock must be between 0 and 1000",
    },
];

/// Trims and HTML-escapes a submitted value. Applied before validation and
/// before the value is stored or redisplayed.
pub fn sanitize(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Evaluates `rules` in order against the named `fields` (already sanitized)
/// and returns every failure. A field missing from `fields` counts as empty.
/// Numeric rules skip empty values and range rules skip unparseable ones, so
/// a single bad field reports one error rather than a stack of them.
pub fn validate(rules: &[FieldRule], fields: &[(&'static str, &str)]) -> Vec<FieldError> {
    let value_of = |name: &str| {
        fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
            .unwrap_or("")
    };

    let mut errors = Vec::new();
    for rule in rules {
        let value = value_of(rule.field);
        let failed = match rule.rule {
            Rule::NotEmpty => value.is_empty(),
            Rule::Numeric => !value.is_empty() && !is_numeric(value),
            Rule::Integer => !value.is_empty() && value.parse::<i64>().is_err(),
            Rule::Range { min, max } => match value.parse::<f64>() {
                Ok(number) if number.is_finite() => number < min || number > max,
                _ => false,
            },
        };
        if failed {
            errors.push(FieldError {
                field: rule.field,
                message: rule.message,
            });
        }
    }
    errors
}

fn is_numeric(value: &str) -> bool {
    matches!(value.parse::<f64>(), Ok(number) if number.is_finite())
}
