mod history_list;

pub use history_list::HistoryList;
