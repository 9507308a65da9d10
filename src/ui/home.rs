use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

const MENU: [(&str, HomeAction); 2] = [
    ("Criar Cliente", HomeAction::CreateClient),
    ("Listar Clientes", HomeAction::ListClients),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeAction {
    CreateClient,
    ListClients,
    Exit,
}

pub struct HomeState {
    list_state: ListState,
}

impl HomeState {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self { list_state }
    }

    pub fn next(&mut self) {
        let i = self.list_state.selected().map_or(0, |i| (i + 1) % MENU.len());
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let i = self
            .list_state
            .selected()
            .map_or(0, |i| (i + MENU.len() - 1) % MENU.len());
        self.list_state.select(Some(i));
    }

    fn selected_action(&self) -> Option<HomeAction> {
        self.list_state
            .selected()
            .and_then(|i| MENU.get(i))
            .map(|(_, action)| *action)
    }
}

pub fn render_home<B: Backend>(f: &mut Frame<B>, state: &mut HomeState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(4),
                Constraint::Min(4),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = Paragraph::new(vec![
        Spans::from(Span::styled(
            "F&S Academia",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Spans::from("Gerencie seus clientes com facilidade"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = MENU
        .iter()
        .map(|(label, _)| ListItem::new(*label))
        .collect();
    let menu = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Red)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(menu, chunks[1], &mut state.list_state);

    let help = Paragraph::new("Enter - Abrir | Cima/Baixo - Navegar | C - Criar | L - Listar | Q - Sair")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

pub fn handle_key(state: &mut HomeState, key: KeyCode) -> Option<HomeAction> {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => Some(HomeAction::Exit),
        KeyCode::Char('c') => Some(HomeAction::CreateClient),
        KeyCode::Char('l') => Some(HomeAction::ListClients),
        KeyCode::Enter => state.selected_action(),
        KeyCode::Down => {
            state.next();
            None
        }
        KeyCode::Up => {
            state.previous();
            None
        }
        _ => None,
    }
}

pub fn handle_input(state: &mut HomeState) -> Result<Option<HomeAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}
