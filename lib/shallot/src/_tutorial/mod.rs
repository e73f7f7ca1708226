//! # Tutorial: Composing HTTP clients with shallot
//!
//! Learn to build a request pipeline out of small middlewares.
//!
//! ## Chapters
//!
//! 1. [Handlers & Middlewares][chapter_0] - The two contracts everything is built on
//! 2. [Chains][chapter_1] - Ordering, parents, copies
//! 3. [The Client][chapter_2] - Sending real requests
//!
//! Ready? Start with [Chapter 0: Handlers & Middlewares][chapter_0].

pub mod chapter_0;
pub mod chapter_1;
pub mod chapter_2;
