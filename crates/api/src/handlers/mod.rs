pub mod essay;
