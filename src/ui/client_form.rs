use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{ClientFields, ClientRecord};
use crate::ui::components::masked_input::{FieldMask, MaskedInput};
use crate::ui::components::notice::{render_notice, Notice};

pub enum ClientFormAction {
    Cancel,
    Create(ClientFields),
    Update(ClientRecord),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum ClientField {
    Name,
    BirthDate,
    Height,
    Weight,
    Phone,
}

const FIELDS: [ClientField; 5] = [
    ClientField::Name,
    ClientField::BirthDate,
    ClientField::Height,
    ClientField::Weight,
    ClientField::Phone,
];

impl ClientField {
    fn label(self) -> &'static str {
        match self {
            ClientField::Name => "Nome",
            ClientField::BirthDate => "Data de Nascimento (DD/MM/AAAA)",
            ClientField::Height => "Altura (em cm)",
            ClientField::Weight => "Peso (em kg)",
            ClientField::Phone => "Telefone",
        }
    }

    fn mask(self) -> FieldMask {
        match self {
            ClientField::Name => FieldMask::Text,
            ClientField::BirthDate => FieldMask::BirthDate,
            ClientField::Height => FieldMask::Height,
            ClientField::Weight => FieldMask::Weight,
            ClientField::Phone => FieldMask::Phone,
        }
    }
}

/// Whether the form creates a new client or edits the one with `id`
#[derive(Clone, PartialEq, Debug)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

pub struct ClientFormState {
    pub mode: FormMode,
    pub inputs: Vec<MaskedInput>,
    pub current_field: ClientField,
    pub editing: bool,
    pub notice: Option<Notice>,
}

impl ClientFormState {
    pub fn new() -> Self {
        Self {
            mode: FormMode::Create,
            inputs: FIELDS
                .iter()
                .map(|field| MaskedInput::new(field.mask(), ""))
                .collect(),
            current_field: ClientField::Name,
            editing: false,
            notice: None,
        }
    }

    pub fn from_existing(client: ClientRecord) -> Self {
        let values = [
            client.name,
            client.birth_date,
            client.height,
            client.weight,
            client.phone,
        ];

        Self {
            mode: FormMode::Edit { id: client.id },
            inputs: FIELDS
                .iter()
                .zip(values)
                .map(|(field, value)| MaskedInput::new(field.mask(), value))
                .collect(),
            current_field: ClientField::Name,
            editing: false,
            notice: None,
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        let i = self.current_field as usize;
        self.current_field = FIELDS[(i + 1) % FIELDS.len()];
    }

    pub fn previous_field(&mut self) {
        let i = self.current_field as usize;
        self.current_field = FIELDS[(i + FIELDS.len() - 1) % FIELDS.len()];
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }
        self.inputs[self.current_field as usize].handle_input(key);
    }

    pub fn value(&self, field: ClientField) -> &str {
        &self.inputs[field as usize].value
    }

    pub fn fields(&self) -> ClientFields {
        ClientFields {
            name: self.value(ClientField::Name).to_string(),
            birth_date: self.value(ClientField::BirthDate).to_string(),
            height: self.value(ClientField::Height).to_string(),
            weight: self.value(ClientField::Weight).to_string(),
            phone: self.value(ClientField::Phone).to_string(),
        }
    }

    /// Clear the form after a successful create, keeping the notice
    pub fn reset(&mut self) {
        for input in &mut self.inputs {
            input.clear();
        }
        self.current_field = ClientField::Name;
        self.editing = false;
    }

    fn save_action(&self) -> ClientFormAction {
        match &self.mode {
            FormMode::Create => ClientFormAction::Create(self.fields()),
            FormMode::Edit { id } => {
                ClientFormAction::Update(ClientRecord::from_fields(id.clone(), self.fields()))
            }
        }
    }
}

/// Confirmation text listing the saved fields
pub fn saved_summary(title: &str, client: &ClientRecord) -> String {
    format!(
        "{}. Nome: {} | Nascimento: {} | Altura: {} | Peso: {} | Telefone: {}",
        title, client.name, client.birth_date, client.height, client.weight, client.phone
    )
}

pub fn render_client_form<B: Backend>(f: &mut Frame<B>, state: &mut ClientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(7),
                Constraint::Length(4),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title_text = match state.mode {
        FormMode::Create => "Criar Cliente",
        FormMode::Edit { .. } => "Editar Cliente",
    };

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    if let Some(notice) = &state.notice {
        render_notice(f, notice, chunks[2]);
    }

    let save_label = match state.mode {
        FormMode::Create => "S - Salvar Cliente",
        FormMode::Edit { .. } => "S - Salvar Alterações",
    };
    let help_text = if state.editing {
        "Enter - Concluir campo | Esc - Concluir campo".to_string()
    } else {
        format!("Enter - Editar campo | Cima/Baixo - Navegar | {} | Esc - Voltar", save_label)
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &mut ClientFormState, area: Rect) {
    let items: Vec<ListItem> = FIELDS
        .iter()
        .zip(state.inputs.iter())
        .map(|(field, input)| {
            let selected = *field == state.current_field;
            let content = if selected && state.editing {
                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label()), Style::default().fg(Color::Yellow)),
                    Span::styled(
                        input.get_display_string(true),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                let style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{}: ", field.label()), style),
                    Span::raw(input.get_display_string(false)),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Dados do Cliente"));

    f.render_widget(form_list, area);
}

pub fn handle_key(state: &mut ClientFormState, key: KeyCode) -> Option<ClientFormAction> {
    match key {
        KeyCode::Esc => {
            if state.editing {
                state.toggle_editing();
            } else {
                return Some(ClientFormAction::Cancel);
            }
        }
        KeyCode::Enter => {
            state.toggle_editing();
        }
        KeyCode::Up if !state.editing => {
            state.previous_field();
        }
        KeyCode::Down | KeyCode::Tab if !state.editing => {
            state.next_field();
        }
        KeyCode::Char('s') | KeyCode::Char('S') if !state.editing => {
            return Some(state.save_action());
        }
        _ if state.editing => {
            state.edit_current_field(key);
        }
        _ => {}
    }

    None
}

pub fn handle_input(state: &mut ClientFormState) -> Result<Option<ClientFormAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(state: &mut ClientFormState, text: &str) {
        handle_key(state, KeyCode::Enter);
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c));
        }
        handle_key(state, KeyCode::Enter);
        handle_key(state, KeyCode::Down);
    }

    #[test]
    fn filling_the_create_form_produces_masked_fields() {
        let mut state = ClientFormState::new();
        type_into(&mut state, "Ana");
        type_into(&mut state, "01011990");
        type_into(&mut state, "170cm");
        type_into(&mut state, "60.5kg");
        type_into(&mut state, "(11)99999-0000");

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(ClientFormAction::Create(fields)) => {
                assert_eq!(fields.name, "Ana");
                assert_eq!(fields.birth_date, "01/01/1990");
                assert_eq!(fields.height, "170");
                assert_eq!(fields.weight, "60.5");
                assert_eq!(fields.phone, "(11)99999-0000");
            }
            _ => panic!("expected a create action"),
        }
    }

    #[test]
    fn s_while_editing_is_typed_not_saved() {
        let mut state = ClientFormState::new();
        handle_key(&mut state, KeyCode::Enter);

        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.value(ClientField::Name), "s");
    }

    #[test]
    fn edit_form_keeps_the_record_id() {
        let record = ClientRecord {
            id: "abc".to_string(),
            name: "Ana".to_string(),
            birth_date: "01/01/1990".to_string(),
            height: "170".to_string(),
            weight: "60.5".to_string(),
            phone: "123".to_string(),
        };
        let mut state = ClientFormState::from_existing(record.clone());
        state.current_field = ClientField::Weight;
        handle_key(&mut state, KeyCode::Enter);
        handle_key(&mut state, KeyCode::Backspace);
        handle_key(&mut state, KeyCode::Esc);

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(ClientFormAction::Update(updated)) => {
                assert_eq!(updated.id, "abc");
                assert_eq!(updated.weight, "60.");
                assert_eq!(updated.name, record.name);
            }
            _ => panic!("expected an update action"),
        }
    }

    #[test]
    fn field_navigation_wraps_around() {
        let mut state = ClientFormState::new();

        state.previous_field();
        assert_eq!(state.current_field, ClientField::Phone);
        state.next_field();
        assert_eq!(state.current_field, ClientField::Name);
    }

    #[test]
    fn esc_outside_editing_cancels() {
        let mut state = ClientFormState::new();

        assert!(matches!(
            handle_key(&mut state, KeyCode::Esc),
            Some(ClientFormAction::Cancel)
        ));
    }

    #[test]
    fn reset_clears_every_input() {
        let mut state = ClientFormState::new();
        type_into(&mut state, "Ana");
        state.notice = Some(Notice::Info("ok".to_string()));

        state.reset();

        assert_eq!(state.fields(), ClientFields::default());
        assert_eq!(state.current_field, ClientField::Name);
        assert!(state.notice.is_some());
    }
}
