pub mod generation_handler;
pub mod health;
pub mod question_set_handler;

use actix_web::web;

pub use generation_handler::{generate_questions, generate_questions_stream, preview_insertion};
pub use health::health_check;
pub use question_set_handler::{
    create_question_set, delete_question_set, export_canvas_markdown, get_question_set,
    list_question_sets, update_question_set,
};

/// Registers every route of the API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(list_question_sets)
        .service(create_question_set)
        .service(export_canvas_markdown)
        .service(get_question_set)
        .service(update_question_set)
        .service(delete_question_set)
        .service(preview_insertion)
        .service(generate_questions_stream)
        .service(generate_questions);
}
