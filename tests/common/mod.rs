pub mod synthetic_scan;
