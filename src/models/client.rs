use serde::{Deserialize, Serialize};

/// A stored client. Serialized with the `camelCase` field names used in the
/// `clients` collection (`birthDate`, not `birth_date`). Keys missing from a
/// stored record load as empty strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientRecord {
    pub id: String,
    pub name: String,
    pub birth_date: String,
    pub height: String,
    pub weight: String,
    pub phone: String,
}

/// The user-editable part of a client, as entered on the create form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientFields {
    pub name: String,
    pub birth_date: String,
    pub height: String,
    pub weight: String,
    pub phone: String,
}

impl ClientRecord {
    pub fn from_fields(id: String, fields: ClientFields) -> Self {
        Self {
            id,
            name: fields.name,
            birth_date: fields.birth_date,
            height: fields.height,
            weight: fields.weight,
            phone: fields.phone,
        }
    }

    pub fn fields(&self) -> ClientFields {
        ClientFields {
            name: self.name.clone(),
            birth_date: self.birth_date.clone(),
            height: self.height.clone(),
            weight: self.weight.clone(),
            phone: self.phone.clone(),
        }
    }
}

impl ClientFields {
    /// Labels of the fields that are empty, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("nome", &self.name),
            ("data de nascimento", &self.birth_date),
            ("altura", &self.height),
            ("peso", &self.weight),
            ("telefone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(label, _)| label)
        .collect()
    }
}
