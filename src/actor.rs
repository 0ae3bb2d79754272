pub mod layout_controller;
