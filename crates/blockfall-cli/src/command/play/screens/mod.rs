pub(crate) use self::{game::GameScreen, host::HostScreen};

mod game;
mod host;
