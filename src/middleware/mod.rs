/*
 * Responsibility
 * - auth: bearer token → Principal, access decision per request
 * - problem: structured error bodies with error codes
 * - cors / http / security_headers: transport concerns, applied last
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod problem;
pub mod security_headers;
