use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::ClientRecord;
use crate::ui::components::notice::{render_notice, Notice};

// Represents the state of the client list screen
pub struct ClientsState {
    clients: Vec<ClientRecord>,
    list_state: ListState,
    show_delete_confirmation: bool,
    pub notice: Option<Notice>,
}

impl ClientsState {
    pub fn new(clients: Vec<ClientRecord>) -> Self {
        let mut list_state = ListState::default();
        if !clients.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            clients,
            list_state,
            show_delete_confirmation: false,
            notice: None,
        }
    }

    pub fn clients(&self) -> &[ClientRecord] {
        &self.clients
    }

    pub fn next(&mut self) {
        if self.clients.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.clients.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.clients.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.clients.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.show_delete_confirmation
    }

    pub fn selected_client(&self) -> Option<&ClientRecord> {
        self.list_state.selected().and_then(|i| self.clients.get(i))
    }

    pub fn selected_client_id(&self) -> Option<String> {
        self.selected_client().map(|c| c.id.clone())
    }
}

pub enum ClientAction {
    Back,
    EditClient(ClientRecord),
    DeleteClient(String), // Contains client id
}

fn client_item(client: &ClientRecord) -> ListItem<'static> {
    ListItem::new(vec![
        Spans::from(format!("Nome: {}", client.name)),
        Spans::from(format!("Data de Nascimento: {}", client.birth_date)),
        Spans::from(format!("Altura: {} cm", client.height)),
        Spans::from(format!("Peso: {} kg", client.weight)),
        Spans::from(format!("Telefone: {}", client.phone)),
        Spans::from(""),
    ])
}

pub fn render_clients<B: Backend>(frame: &mut Frame<B>, state: &mut ClientsState) {
    let size = frame.size();

    let notice_height = if state.notice.is_some() { 4 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(notice_height),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    let block = Block::default().title("Lista de Clientes").borders(Borders::ALL);

    if state.clients.is_empty() {
        let empty = Paragraph::new("Nenhum cliente cadastrado.")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(empty, chunks[0]);
    } else {
        let items: Vec<ListItem> = state.clients.iter().map(client_item).collect();

        let clients_list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(Color::Red)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

        frame.render_stateful_widget(clients_list, chunks[0], &mut state.list_state);
    }

    if let Some(notice) = &state.notice {
        render_notice(frame, notice, chunks[1]);
    }

    let buttons_text = if state.selected_client().is_some() {
        "<E> Editar | <D> Excluir | <Esc> Voltar"
    } else {
        "<Esc> Voltar"
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[2]);

    if state.is_confirming_delete() {
        render_delete_confirmation(frame, size);
    }
}

fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect) {
    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from("Tem certeza que deseja excluir este cliente?"),
        Spans::from(""),
        Spans::from("<S> Excluir  <N> Cancelar"),
    ])
    .block(Block::default().title("Excluir Cliente").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn handle_key(state: &mut ClientsState, key: KeyCode) -> Option<ClientAction> {
    if state.show_delete_confirmation {
        match key {
            KeyCode::Char('s') | KeyCode::Char('y') => {
                state.toggle_delete_confirmation();
                return state.selected_client_id().map(ClientAction::DeleteClient);
            }
            KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => {
                state.toggle_delete_confirmation();
            }
            _ => {}
        }
        return None;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ClientAction::Back),
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(client) = state.selected_client() {
                return Some(ClientAction::EditClient(client.clone()));
            }
        }
        KeyCode::Char('d') => {
            if state.selected_client().is_some() {
                state.toggle_delete_confirmation();
            }
        }
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }

    None
}

pub fn handle_input(state: &mut ClientsState) -> Result<Option<ClientAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}
