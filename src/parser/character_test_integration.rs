//! Integration tests for character literal parsing

use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::ast::{Expr, Literal};
