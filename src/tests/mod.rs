
mod terminal;
