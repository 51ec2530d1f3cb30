//! Face anonymization for camera streams, videos and still images.
//!
//! Organised by bounded context, each split into `domain` (types, rules and
//! port traits) and `infrastructure` (adapters backed by ffmpeg, ONNX Runtime
//! and the `image` crate). [`pipeline::session::Session`] ties them into the
//! per-frame loop.

pub mod shared {
    pub mod constants;
    pub mod frame;
    pub mod model_resolver;
    pub mod region;
    pub mod video_metadata;
}

pub mod detection {
    pub mod domain {
        pub mod detection;
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod effects {
    pub mod domain {
        pub mod effect_engine;
        pub mod effect_kind;
        pub mod effect_state;
        pub mod intensity;
    }
    pub mod infrastructure;
}

pub mod control {
    pub mod domain {
        pub mod control_event;
        pub mod control_input;
        pub mod interactive_controller;
        pub mod session_context;
    }
    pub mod infrastructure;
}

pub mod compositing {
    pub mod domain {
        pub mod display_layout;
    }
    pub mod infrastructure;
}

pub mod video {
    pub mod domain {
        pub mod frame_sink;
        pub mod frame_source;
        pub mod image_writer;
    }
    pub mod infrastructure;
}

pub mod pipeline;
