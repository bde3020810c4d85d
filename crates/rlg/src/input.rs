//! Line-oriented keyboard input for `--play`

use std::io::{self, BufRead, Write};

use log::warn;

use rlg_core::action::{ActionSource, PlayerAction, Query, TurnView};

/// Reads one key per action from a buffered reader, answering queries on stdout
pub struct LineInput<R> {
    reader: R,
    pending: Vec<char>,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
        }
    }

    /// Next non-whitespace key, or `None` at end of input
    fn next_key(&mut self) -> Option<char> {
        loop {
            if let Some(key) = self.pending.pop() {
                return Some(key);
            }
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.pending = line.chars().rev().filter(|c| !c.is_whitespace()).collect();
                }
                Err(err) => {
                    warn!("input error: {err}");
                    return None;
                }
            }
        }
    }
}

impl LineInput<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> ActionSource for LineInput<R> {
    fn next_action(&mut self, view: &TurnView<'_>) -> PlayerAction {
        if self.pending.is_empty() {
            print!("{}> ", view.level.render(view.actors));
            io::stdout().flush().ok();
        }
        loop {
            let Some(key) = self.next_key() else {
                return PlayerAction::Quit;
            };
            match PlayerAction::from_key(key) {
                Some(PlayerAction::Query(query)) => {
                    answer(query, view);
                    return PlayerAction::Query(query);
                }
                Some(action) => return action,
                None => println!("unknown key {key:?}"),
            }
        }
    }
}

fn answer(query: Query, view: &TurnView<'_>) {
    match query {
        Query::Map => print!("{}", view.level.render(view.actors)),
        Query::MonsterList => {
            let lines = view.monster_list();
            if lines.is_empty() {
                println!("no monsters left");
            }
            for line in lines {
                println!("{line}");
            }
        }
    }
}
