mod alert;
mod audio;
