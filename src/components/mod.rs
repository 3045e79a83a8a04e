pub mod thread;

#[cfg(test)]
mod tests;
