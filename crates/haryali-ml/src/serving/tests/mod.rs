mod common;
mod dispatcher;
