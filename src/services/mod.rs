pub mod canvas_renderer;
pub mod insertion_planner;
pub mod model_service;
pub mod prompt_composer;
pub mod question_generation_service;
pub mod question_set_service;
pub mod quota_grammar;
pub mod response_normalizer;
