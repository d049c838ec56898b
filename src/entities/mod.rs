// ABOUTME: SeaORM entities module for the practice records and their relationships
// ABOUTME: Exports entity definitions for users, clients, cases, case notes and case documents

pub mod case;
pub mod case_document;
pub mod case_note;
pub mod client;
pub mod user;

