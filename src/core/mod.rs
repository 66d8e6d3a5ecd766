//! Core conversion engine

pub mod latex2html;
