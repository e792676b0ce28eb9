mod common;
mod definition;
