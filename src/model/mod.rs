pub mod check_in;
