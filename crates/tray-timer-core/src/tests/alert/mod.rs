mod allow_list;
mod coordinator;
mod text_history;
