use crossterm::event::KeyCode;

/// Character filter and length limit applied to a form field as it is typed
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FieldMask {
    Text,
    /// `DD/MM/YYYY`, separators inserted automatically
    BirthDate,
    /// Centimeters, digits only
    Height,
    /// Kilograms, digits and one decimal point
    Weight,
    Phone,
}

const BIRTH_DATE_DIGITS: usize = 8;

impl FieldMask {
    pub fn max_len(self) -> Option<usize> {
        match self {
            FieldMask::Text => None,
            FieldMask::BirthDate => Some(10),
            FieldMask::Height => Some(3),
            FieldMask::Weight => Some(5),
            FieldMask::Phone => Some(15),
        }
    }

    /// Filter `raw` down to what this field accepts
    pub fn apply(self, raw: &str) -> String {
        let filtered: String = match self {
            FieldMask::Text => return raw.to_string(),
            FieldMask::BirthDate => return format_birth_date(raw),
            FieldMask::Height => raw.chars().filter(char::is_ascii_digit).collect(),
            FieldMask::Weight => {
                let mut seen_point = false;
                raw.chars()
                    .filter(|c| match c {
                        '0'..='9' => true,
                        '.' if !seen_point => {
                            seen_point = true;
                            true
                        }
                        _ => false,
                    })
                    .collect()
            }
            FieldMask::Phone => raw
                .chars()
                .filter(|c| c.is_ascii_digit() || matches!(c, '(' | ')' | '-' | ' '))
                .collect(),
        };

        match self.max_len() {
            Some(max) => filtered.chars().take(max).collect(),
            None => filtered,
        }
    }
}

fn format_birth_date(raw: &str) -> String {
    let mut formatted = String::new();
    for (i, digit) in raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(BIRTH_DATE_DIGITS)
        .enumerate()
    {
        if i == 2 || i == 4 {
            formatted.push('/');
        }
        formatted.push(digit);
    }
    formatted
}

/// A single text field that runs every keystroke through its mask
#[derive(Clone, Debug, PartialEq)]
pub struct MaskedInput {
    pub mask: FieldMask,
    pub value: String,
}

impl MaskedInput {
    pub fn new(mask: FieldMask, value: impl Into<String>) -> Self {
        Self {
            mask,
            value: value.into(),
        }
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => {
                let candidate = format!("{}{}", self.value, c);
                let masked = self.mask.apply(&candidate);
                // Rejected keystrokes must not reformat what is already there
                if masked.len() > self.value.len() {
                    self.value = masked;
                }
            }
            KeyCode::Backspace => {
                let mut digits: String = self.value.chars().filter(char::is_ascii_digit).collect();
                // Values typed in another layout are edited as plain text
                if self.mask == FieldMask::BirthDate && format_birth_date(&digits) == self.value {
                    digits.pop();
                    self.value = format_birth_date(&digits);
                } else {
                    self.value.pop();
                }
            }
            _ => {}
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn get_display_string(&self, editing: bool) -> String {
        if editing {
            format!("{}|", self.value)
        } else {
            self.value.clone()
        }
    }
}
